//! Resolve a command line against a small built-in demo toolchain:
//!
//! ```text
//! cargo run --example resolve -- c-compile --feature opt
//! cargo run --example resolve -- c-compile --feature opt --sysroot /usr/x86_64-linux-gnu
//! ```

use clap::Parser;

use crosshatch::actions::BuildModes;
use crosshatch::features::FeatureResolver;
use crosshatch::variables::{VariableValue, Variables};
use crosshatch_crosstool::feature::{
    ActionConfigBuilder, FeatureBuilder, FlagGroupBuilder, FlagSetBuilder, ToolBuilder,
};
use crosshatch_crosstool::toolchain::{Toolchain, ToolchainBuilder};

#[derive(Parser)]
struct Opts {
    /// Action to resolve, e.g. c-compile.
    action: String,

    /// Features to request, repeatable.
    #[arg(long = "feature")]
    features: Vec<String>,

    /// Features to disable, repeatable.
    #[arg(long = "no-feature")]
    disabled: Vec<String>,

    #[arg(long)]
    sysroot: Option<String>,

    /// Include directories bound as the `include_paths` list variable.
    #[arg(long = "include")]
    include_paths: Vec<String>,
}

fn demo_toolchain() -> Toolchain {
    let warnings = FeatureBuilder::default()
        .name("warnings")
        .enabled(true)
        .flag_set(
            FlagSetBuilder::default()
                .action("c-compile")
                .action("c++-compile")
                .flag_group(
                    FlagGroupBuilder::default()
                        .flag("-Wall")
                        .flag("-Wextra")
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let sysroot = FeatureBuilder::default()
        .name("sysroot")
        .enabled(true)
        .flag_set(
            FlagSetBuilder::default()
                .action("c-compile")
                .action("c++-compile")
                .flag_group(
                    FlagGroupBuilder::default()
                        .expand_if_available("sysroot")
                        .flag("--sysroot=%{sysroot}")
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let includes = FeatureBuilder::default()
        .name("includes")
        .enabled(true)
        .flag_set(
            FlagSetBuilder::default()
                .action("c-compile")
                .action("c++-compile")
                .flag_group(
                    FlagGroupBuilder::default()
                        .expand_if_available("include_paths")
                        .iterate_over("include_paths")
                        .flag("-I%{include_paths}")
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let opt = FeatureBuilder::default()
        .name("opt")
        .provide("compilation_mode")
        .flag_set(
            FlagSetBuilder::default()
                .action("c-compile")
                .action("c++-compile")
                .flag_group(
                    FlagGroupBuilder::default()
                        .flag("-O2")
                        .flag("-DNDEBUG")
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let dbg = FeatureBuilder::default()
        .name("dbg")
        .provide("compilation_mode")
        .flag_set(
            FlagSetBuilder::default()
                .action("c-compile")
                .action("c++-compile")
                .flag_group(FlagGroupBuilder::default().flag("-g").build().unwrap())
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let compile = ActionConfigBuilder::default()
        .config_name("c-compile")
        .action_name("c-compile")
        .enabled(true)
        .tool(ToolBuilder::default().tool_path("bin/gcc").build().unwrap())
        .build()
        .unwrap();

    ToolchainBuilder::default()
        .toolchain_identifier("demo_gcc")
        .target_cpu("x86_64")
        .compiler("gcc")
        .feature(warnings)
        .feature(sysroot)
        .feature(includes)
        .feature(opt)
        .feature(dbg)
        .action_config(compile)
        .compiler_flag(vec!["-pipe".to_string()])
        .build()
        .unwrap()
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let toolchain = demo_toolchain();
    let resolver = FeatureResolver::new(&toolchain)?;
    let config = resolver.resolve_features(&opts.features, &opts.disabled)?;

    println!(
        "enabled: {:?}",
        config.enabled_features().collect::<Vec<_>>()
    );

    let mut vars = Variables::new();
    if let Some(sysroot) = &opts.sysroot {
        vars.set("sysroot", sysroot.as_str());
    }
    if !opts.include_paths.is_empty() {
        vars.set(
            "include_paths",
            VariableValue::list(opts.include_paths.iter().map(String::as_str)),
        );
    }

    if let Ok(tool) = config.tool(&opts.action) {
        println!("tool: {} ({})", tool.tool_path, tool.tool_path_origin);
    }

    let flags = config.command_line(&opts.action, &vars, &BuildModes::default())?;
    println!("flags: {flags:#?}");

    let env = config.environment(&opts.action, &vars)?;
    if !env.is_empty() {
        println!("env: {env:#?}");
    }

    Ok(())
}
