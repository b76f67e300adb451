use crate::actions::BuildModes;
use crate::errors::ResolutionResult;
use crate::features::FeatureConfiguration;
use crate::variables::Variables;
use default_args::default_args;

extern crate self as _current_crate;

default_args! {
    export pub fn crate::macros::command_line(config: &FeatureConfiguration<'_>, action: &str, vars: &Variables, modes: BuildModes = BuildModes::default()) -> ResolutionResult<Vec<String>> {
        config.command_line(action, vars, &modes)
    }
}

pub(crate) use command_line;
