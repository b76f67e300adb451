//! Artifact categories and the name patterns toolchains may override them with.

use derive_builder::Builder;

/// Maps an artifact category to the `(prefix, extension)` pair used to name generated
/// files, e.g. `lib` + `.so` around a library's base name.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
#[builder(default, setter(into))]
pub struct ArtifactNamePattern {
    /// Must name one of the [`ArtifactCategory`] values.
    pub category_name: String,
    pub prefix: String,
    pub extension: String,
}

/// The fixed set of artifact categories a toolchain may name files for. Each carries the
/// default prefix/extension used when the toolchain declares no pattern of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactCategory {
    StaticLibrary,
    AlwayslinkStaticLibrary,
    DynamicLibrary,
    InterfaceLibrary,
    Executable,
    ObjectFile,
    PicObjectFile,
    CppModule,
    GeneratedAssembly,
    GeneratedHeader,
    PreprocessedCSource,
    PreprocessedCppSource,
    IncludedFileList,
    CoverageDataFile,
}

impl ArtifactCategory {
    pub const ALL: &'static [ArtifactCategory] = &[
        ArtifactCategory::StaticLibrary,
        ArtifactCategory::AlwayslinkStaticLibrary,
        ArtifactCategory::DynamicLibrary,
        ArtifactCategory::InterfaceLibrary,
        ArtifactCategory::Executable,
        ArtifactCategory::ObjectFile,
        ArtifactCategory::PicObjectFile,
        ArtifactCategory::CppModule,
        ArtifactCategory::GeneratedAssembly,
        ArtifactCategory::GeneratedHeader,
        ArtifactCategory::PreprocessedCSource,
        ArtifactCategory::PreprocessedCppSource,
        ArtifactCategory::IncludedFileList,
        ArtifactCategory::CoverageDataFile,
    ];

    pub fn from_name(name: &str) -> Option<ArtifactCategory> {
        ArtifactCategory::ALL
            .iter()
            .copied()
            .find(|category| category.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ArtifactCategory::StaticLibrary => "static_library",
            ArtifactCategory::AlwayslinkStaticLibrary => "alwayslink_static_library",
            ArtifactCategory::DynamicLibrary => "dynamic_library",
            ArtifactCategory::InterfaceLibrary => "interface_library",
            ArtifactCategory::Executable => "executable",
            ArtifactCategory::ObjectFile => "object_file",
            ArtifactCategory::PicObjectFile => "pic_object_file",
            ArtifactCategory::CppModule => "cpp_module",
            ArtifactCategory::GeneratedAssembly => "generated_assembly",
            ArtifactCategory::GeneratedHeader => "generated_header",
            ArtifactCategory::PreprocessedCSource => "preprocessed_c_source",
            ArtifactCategory::PreprocessedCppSource => "preprocessed_cpp_source",
            ArtifactCategory::IncludedFileList => "included_file_list",
            ArtifactCategory::CoverageDataFile => "coverage_data_file",
        }
    }

    pub fn default_prefix(&self) -> &'static str {
        match self {
            ArtifactCategory::StaticLibrary
            | ArtifactCategory::AlwayslinkStaticLibrary
            | ArtifactCategory::DynamicLibrary
            | ArtifactCategory::InterfaceLibrary => "lib",
            _ => "",
        }
    }

    pub fn default_extension(&self) -> &'static str {
        match self {
            ArtifactCategory::StaticLibrary => ".a",
            ArtifactCategory::AlwayslinkStaticLibrary => ".lo",
            ArtifactCategory::DynamicLibrary => ".so",
            ArtifactCategory::InterfaceLibrary => ".ifso",
            ArtifactCategory::Executable => "",
            ArtifactCategory::ObjectFile => ".o",
            ArtifactCategory::PicObjectFile => ".pic.o",
            ArtifactCategory::CppModule => ".pcm",
            ArtifactCategory::GeneratedAssembly => ".s",
            ArtifactCategory::GeneratedHeader => ".h",
            ArtifactCategory::PreprocessedCSource => ".i",
            ArtifactCategory::PreprocessedCppSource => ".ii",
            ArtifactCategory::IncludedFileList => ".d",
            ArtifactCategory::CoverageDataFile => ".gcno",
        }
    }
}
