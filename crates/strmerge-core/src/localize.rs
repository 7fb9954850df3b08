//! Project-wide incremental localization
//!
//! For every `*.lproj` directory the strings table is regenerated from
//! source and merged with the existing translations:
//!
//! 1. `X.strings` is renamed to `X.strings.old`
//! 2. the extractor writes a fresh `X.strings`, renamed to `X.strings.new`
//! 3. old and new are merged back into `X.strings`
//!
//! Interface files of non-template languages are then rebuilt from the
//! template language when the template is newer. External tools are reached
//! through [`Toolchain`].

use crate::config::LocalizeConfig;
use crate::error::{Error, Result};
use crate::merger::{merge_files, MergeReport};
use crate::scanner::{scan_project, Language, ScanResult};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// External tools driven during a localization run
pub trait Toolchain {
    /// Extract localizable strings from `sources` into a strings table
    /// inside `output_dir`
    fn extract_strings(&self, output_dir: &Path, sources: &[PathBuf]) -> Result<()>;

    /// Export the current strings of an interface file to `strings`
    fn export_interface_strings(&self, interface: &Path, strings: &Path) -> Result<()>;

    /// Rebuild `interface` from `template`, applying `strings`
    fn write_interface(&self, interface: &Path, strings: &Path, template: &Path) -> Result<()>;
}

/// `genstrings` and `ibtool` run as child processes
#[derive(Debug, Clone)]
pub struct XcodeToolchain {
    genstrings: String,
    ibtool: String,
}

impl XcodeToolchain {
    pub fn new(genstrings: impl Into<String>, ibtool: impl Into<String>) -> Self {
        Self {
            genstrings: genstrings.into(),
            ibtool: ibtool.into(),
        }
    }

    pub fn from_config(config: &LocalizeConfig) -> Self {
        Self::new(&config.genstrings, &config.ibtool)
    }
}

fn run_tool(tool: &str, command: &mut Command) -> Result<()> {
    debug!(?command, "running {}", tool);
    let status = command.status().map_err(|e| Error::ToolSpawn {
        tool: tool.to_string(),
        source: e,
    })?;

    if !status.success() {
        return Err(Error::ToolFailed {
            tool: tool.to_string(),
            status,
        });
    }
    Ok(())
}

impl Toolchain for XcodeToolchain {
    fn extract_strings(&self, output_dir: &Path, sources: &[PathBuf]) -> Result<()> {
        run_tool(
            &self.genstrings,
            Command::new(&self.genstrings)
                .arg("-q")
                .arg("-o")
                .arg(output_dir)
                .args(sources),
        )
    }

    fn export_interface_strings(&self, interface: &Path, strings: &Path) -> Result<()> {
        run_tool(
            &self.ibtool,
            Command::new(&self.ibtool)
                .arg(interface)
                .arg("--generate-strings-file")
                .arg(strings),
        )
    }

    fn write_interface(&self, interface: &Path, strings: &Path, template: &Path) -> Result<()> {
        run_tool(
            &self.ibtool,
            Command::new(&self.ibtool)
                .arg("--write")
                .arg(interface)
                .arg("--strings-file")
                .arg(strings)
                .arg(template),
        )
    }
}

/// What happened to a language's strings table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StringsOutcome {
    /// Existing translations were merged with the regenerated table
    Merged { report: MergeReport },
    /// No table existed yet; a fresh one was generated
    Generated,
    /// The run for this language stopped with an error
    Failed { error: String },
}

/// Result of localizing one language directory
#[derive(Debug, Clone, Serialize)]
pub struct LanguageReport {
    pub language: String,
    pub strings: StringsOutcome,
    /// Interface files rebuilt from the template language
    pub interfaces_updated: Vec<PathBuf>,
}

/// Result of a project-wide run
#[derive(Debug, Clone, Serialize)]
pub struct LocalizeReport {
    pub root: PathBuf,
    pub languages: Vec<LanguageReport>,
}

impl LocalizeReport {
    /// Languages whose run stopped with an error
    pub fn failures(&self) -> impl Iterator<Item = &LanguageReport> {
        self.languages
            .iter()
            .filter(|l| matches!(l.strings, StringsOutcome::Failed { .. }))
    }

    pub fn find_language(&self, name: &str) -> Option<&LanguageReport> {
        self.languages.iter().find(|l| l.language == name)
    }
}

/// Localize every language directory under `root`.
///
/// A failure in one language is recorded in the report and the run moves on
/// to the next language. Only a failure to scan the project aborts.
pub fn localize_project<P, T>(root: P, config: &LocalizeConfig, tools: &T) -> Result<LocalizeReport>
where
    P: AsRef<Path>,
    T: Toolchain + ?Sized,
{
    let root = root.as_ref();
    let scan = scan_project(root, config)?;
    info!(
        "found {} language(s) and {} source file(s) in {}",
        scan.languages.len(),
        scan.source_files.len(),
        root.display()
    );

    let template_dir = root.join(&config.template_language);
    let mut languages = Vec::new();

    for language in &scan.languages {
        let report = match localize_language(language, &scan, &template_dir, config, tools) {
            Ok(report) => report,
            Err(e) => {
                warn!(language = %language.name, "localization failed: {}", e);
                LanguageReport {
                    language: language.name.clone(),
                    strings: StringsOutcome::Failed {
                        error: e.to_string(),
                    },
                    interfaces_updated: Vec::new(),
                }
            }
        };
        languages.push(report);
    }

    Ok(LocalizeReport {
        root: root.to_path_buf(),
        languages,
    })
}

fn localize_language<T: Toolchain + ?Sized>(
    language: &Language,
    scan: &ScanResult,
    template_dir: &Path,
    config: &LocalizeConfig,
    tools: &T,
) -> Result<LanguageReport> {
    let strings = if language.has_strings() {
        let report = update_strings(language, scan, config, tools)?;
        info!(
            language = %language.name,
            kept = report.kept.len(),
            added = report.added.len(),
            dropped = report.dropped.len(),
            "merged {}",
            language.strings_path.display()
        );
        StringsOutcome::Merged { report }
    } else {
        tools.extract_strings(&language.path, &scan.source_files)?;
        info!(language = %language.name, "generated {}", language.strings_path.display());
        StringsOutcome::Generated
    };

    let interfaces_updated = if language.name == config.template_language {
        Vec::new()
    } else {
        localize_interfaces(language, template_dir, tools)?
    };

    Ok(LanguageReport {
        language: language.name.clone(),
        strings,
        interfaces_updated,
    })
}

/// Rotate, regenerate and merge an existing strings table.
///
/// On failure the original table is moved back into place.
fn update_strings<T: Toolchain + ?Sized>(
    language: &Language,
    scan: &ScanResult,
    config: &LocalizeConfig,
    tools: &T,
) -> Result<MergeReport> {
    let original = &language.strings_path;
    let old = with_suffix(original, ".old");
    let new = with_suffix(original, ".new");

    debug!("renaming {} to {}", original.display(), old.display());
    fs::rename(original, &old)?;

    let merged = tools
        .extract_strings(&language.path, &scan.source_files)
        .and_then(|()| fs::rename(original, &new).map_err(Error::from))
        .and_then(|()| merge_files(&old, &new, original));

    match merged {
        Ok(report) => {
            if !config.keep_intermediate {
                fs::remove_file(&old)?;
                fs::remove_file(&new)?;
            }
            Ok(report)
        }
        Err(e) => {
            warn!(
                language = %language.name,
                "restoring {} after failed update",
                original.display()
            );
            fs::rename(&old, original)?;
            Err(e)
        }
    }
}

/// Rebuild interface files whose template counterpart is newer
fn localize_interfaces<T: Toolchain + ?Sized>(
    language: &Language,
    template_dir: &Path,
    tools: &T,
) -> Result<Vec<PathBuf>> {
    let mut updated = Vec::new();

    for interface in &language.interface_files {
        let Some(file_name) = interface.file_name() else {
            continue;
        };
        let template = template_dir.join(file_name);

        if !template.is_file() || !is_newer(&template, interface)? {
            debug!("{} is up to date", interface.display());
            continue;
        }

        let strings = with_suffix(interface, ".strings.old");
        info!(language = %language.name, "updating {}", interface.display());
        tools.export_interface_strings(interface, &strings)?;
        tools.write_interface(interface, &strings, &template)?;
        updated.push(interface.clone());
    }

    Ok(updated)
}

fn is_newer(a: &Path, b: &Path) -> Result<bool> {
    Ok(fs::metadata(a)?.modified()? > fs::metadata(b)?.modified()?)
}

/// `Foo.strings` + `.old` -> `Foo.strings.old`
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::encode_utf16;
    use crate::parser::parse_strings;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    const EXTRACTED: &str =
        "/* Greeting */\n\"HELLO\" = \"HELLO\";\n\n/* Farewell */\n\"BYE\" = \"BYE\";\n";
    const TRANSLATED: &str = "/* old */\n\"HELLO\" = \"Hallo\";\n\n\"REMOVED\" = \"Weg\";\n";

    /// Records calls and writes `extracted` wherever strings are extracted
    struct FakeToolchain {
        extracted: String,
        fail_extract: bool,
        calls: RefCell<Vec<String>>,
    }

    impl FakeToolchain {
        fn new() -> Self {
            Self {
                extracted: EXTRACTED.to_string(),
                fail_extract: false,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn record(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }
    }

    fn file_name(path: &Path) -> String {
        path.file_name().unwrap().to_string_lossy().into_owned()
    }

    impl Toolchain for FakeToolchain {
        fn extract_strings(&self, output_dir: &Path, sources: &[PathBuf]) -> Result<()> {
            self.record(format!("extract {} ({} sources)", file_name(output_dir), sources.len()));
            if self.fail_extract {
                return Err(Error::Io(std::io::Error::other("extractor crashed")));
            }
            fs::write(
                output_dir.join("Localizable.strings"),
                encode_utf16(&self.extracted),
            )?;
            Ok(())
        }

        fn export_interface_strings(&self, interface: &Path, strings: &Path) -> Result<()> {
            self.record(format!("export {} -> {}", file_name(interface), file_name(strings)));
            Ok(())
        }

        fn write_interface(&self, interface: &Path, strings: &Path, template: &Path) -> Result<()> {
            self.record(format!(
                "write {} with {} from {}",
                file_name(interface),
                file_name(strings),
                template.parent().map(file_name).unwrap_or_default()
            ));
            Ok(())
        }
    }

    fn project() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for lang in ["en.lproj", "de.lproj", "fr.lproj"] {
            fs::create_dir(dir.path().join(lang)).unwrap();
        }
        fs::write(dir.path().join("main.m"), "").unwrap();
        fs::write(
            dir.path().join("de.lproj/Localizable.strings"),
            encode_utf16(TRANSLATED),
        )
        .unwrap();
        dir
    }

    fn set_mtime(path: &Path, age_secs: u64) {
        let time = SystemTime::now() - Duration::from_secs(age_secs);
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn test_existing_table_is_merged() {
        let dir = project();
        let tools = FakeToolchain::new();

        let report = localize_project(dir.path(), &LocalizeConfig::default(), &tools).unwrap();

        let de = report.find_language("de.lproj").unwrap();
        assert_eq!(
            de.strings,
            StringsOutcome::Merged {
                report: MergeReport {
                    kept: vec!["HELLO".to_string()],
                    added: vec!["BYE".to_string()],
                    dropped: vec!["REMOVED".to_string()],
                }
            }
        );

        let merged = parse_strings(dir.path().join("de.lproj/Localizable.strings")).unwrap();
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["HELLO", "BYE"]);
        assert_eq!(merged.get("HELLO").unwrap().value, "Hallo");
        assert_eq!(merged.get("HELLO").unwrap().comments, vec!["/* Greeting */"]);
        assert_eq!(merged.get("BYE").unwrap().value, "BYE");

        assert!(dir.path().join("de.lproj/Localizable.strings.old").is_file());
        assert!(dir.path().join("de.lproj/Localizable.strings.new").is_file());
    }

    #[test]
    fn test_missing_table_is_generated() {
        let dir = project();
        let tools = FakeToolchain::new();

        let report = localize_project(dir.path(), &LocalizeConfig::default(), &tools).unwrap();

        assert_eq!(
            report.find_language("fr.lproj").unwrap().strings,
            StringsOutcome::Generated
        );
        let fr = parse_strings(dir.path().join("fr.lproj/Localizable.strings")).unwrap();
        assert_eq!(fr.get("HELLO").unwrap().value, "HELLO");
        assert!(!dir.path().join("fr.lproj/Localizable.strings.old").exists());
        assert!(tools.calls().contains(&"extract fr.lproj (1 sources)".to_string()));
    }

    #[test]
    fn test_intermediate_files_removed_when_configured() {
        let dir = project();
        let config = LocalizeConfig {
            keep_intermediate: false,
            ..LocalizeConfig::default()
        };

        localize_project(dir.path(), &config, &FakeToolchain::new()).unwrap();

        assert!(dir.path().join("de.lproj/Localizable.strings").is_file());
        assert!(!dir.path().join("de.lproj/Localizable.strings.old").exists());
        assert!(!dir.path().join("de.lproj/Localizable.strings.new").exists());
    }

    #[test]
    fn test_malformed_translation_is_restored() {
        let dir = project();
        let original = dir.path().join("de.lproj/Localizable.strings");
        let broken = encode_utf16("/* c */\nHELLO = \"Hallo\";\n");
        fs::write(&original, &broken).unwrap();

        let report =
            localize_project(dir.path(), &LocalizeConfig::default(), &FakeToolchain::new()).unwrap();

        let failures: Vec<_> = report.failures().map(|l| l.language.as_str()).collect();
        assert_eq!(failures, vec!["de.lproj"]);
        assert_eq!(fs::read(&original).unwrap(), broken);
        assert!(!dir.path().join("de.lproj/Localizable.strings.old").exists());

        // Other languages still ran
        assert!(dir.path().join("fr.lproj/Localizable.strings").is_file());
    }

    #[test]
    fn test_extractor_failure_is_restored() {
        let dir = project();
        let original = dir.path().join("de.lproj/Localizable.strings");
        let tools = FakeToolchain {
            fail_extract: true,
            ..FakeToolchain::new()
        };

        let report = localize_project(dir.path(), &LocalizeConfig::default(), &tools).unwrap();

        assert_eq!(report.failures().count(), 3);
        assert_eq!(fs::read(&original).unwrap(), encode_utf16(TRANSLATED));
    }

    #[test]
    fn test_interfaces_follow_newer_template() {
        let dir = project();
        let root = dir.path();
        for path in [
            "en.lproj/Main.xib",
            "de.lproj/Main.xib",
            "en.lproj/About.storyboard",
            "de.lproj/About.storyboard",
            "fr.lproj/Orphan.xib",
        ] {
            fs::write(root.join(path), "").unwrap();
        }
        // Main: template newer. About: localized copy newer.
        set_mtime(&root.join("de.lproj/Main.xib"), 3600);
        set_mtime(&root.join("en.lproj/About.storyboard"), 3600);

        let tools = FakeToolchain::new();
        let report = localize_project(root, &LocalizeConfig::default(), &tools).unwrap();

        assert_eq!(
            report.find_language("de.lproj").unwrap().interfaces_updated,
            vec![root.join("de.lproj/Main.xib")]
        );
        assert!(report.find_language("fr.lproj").unwrap().interfaces_updated.is_empty());
        assert!(report.find_language("en.lproj").unwrap().interfaces_updated.is_empty());

        let interface_calls: Vec<String> = tools
            .calls()
            .into_iter()
            .filter(|c| !c.starts_with("extract"))
            .collect();
        assert_eq!(
            interface_calls,
            vec![
                "export Main.xib -> Main.xib.strings.old".to_string(),
                "write Main.xib with Main.xib.strings.old from en.lproj".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_root_aborts() {
        let err = localize_project(
            "/definitely/not/here",
            &LocalizeConfig::default(),
            &FakeToolchain::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(
            with_suffix(Path::new("de.lproj/Localizable.strings"), ".old"),
            PathBuf::from("de.lproj/Localizable.strings.old")
        );
    }
}
