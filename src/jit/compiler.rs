//! Native compiler discovery and invocation.
//!
//! Unix hosts are scanned for GCC/Clang front-ends on `PATH`. Windows hosts
//! go through `vswhere` to find a Visual Studio installation, run the
//! architecture-specific `vcvars` batch file once, and capture the
//! environment delta it produces so `cl.exe` can be driven directly.
//! Discovery results are cached for the lifetime of the runner.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use anyhow::{bail, Context, Result};

use crate::jit::language::{Language, LanguageVersion};
use crate::jit::platform::{Arch, Os};

const VSWHERE_PATH: &str =
    "C:\\Program Files (x86)\\Microsoft Visual Studio\\Installer\\vswhere.exe";

/// User-tunable toolchain settings.
#[derive(Debug, Clone, Default)]
pub struct ToolchainConfig {
    /// Skip discovery and use this compiler. On Windows this is the path of
    /// a `vcvars` batch file rather than the compiler binary.
    pub compiler_override: Option<PathBuf>,
    /// Extra flags appended to every compile.
    pub extra_flags: Vec<String>,
}

pub struct CompilerRunner {
    config: ToolchainConfig,
    unix_cpp: OnceLock<Option<PathBuf>>,
    unix_c: OnceLock<Option<PathBuf>>,
    visual_studio: OnceLock<Option<VisualStudioEnvironment>>,
}

struct VisualStudioEnvironment {
    cl_exe: PathBuf,
    environment: HashMap<String, String>,
}

impl CompilerRunner {
    pub fn new(config: ToolchainConfig) -> CompilerRunner {
        CompilerRunner {
            config,
            unix_cpp: OnceLock::new(),
            unix_c: OnceLock::new(),
            visual_studio: OnceLock::new(),
        }
    }

    /// Compile `code` into a shared library next to `<out_dir>/<stem>`.
    /// Returns the library path.
    pub fn compile(
        &self,
        code: &str,
        version: LanguageVersion,
        out_dir: &Path,
        stem: &str,
    ) -> Result<PathBuf> {
        let source = out_dir.join(format!("{}{}", stem, version.language.source_extension()));
        fs::write(&source, code)
            .with_context(|| format!("Failed to write source file {}", source.display()))?;

        match Os::current()? {
            Os::Windows => self.compile_msvc(version, &source),
            os => self.compile_unix(version, &source, os),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Unix toolchain
    // ─────────────────────────────────────────────────────────────────────

    fn compile_unix(&self, version: LanguageVersion, source: &Path, os: Os) -> Result<PathBuf> {
        let compiler = self.unix_compiler(version.language)?;
        let extension = os.shared_library_extension().trim_start_matches('.');
        let library = source.with_extension(extension);

        let mut command = Command::new(&compiler);
        command
            .arg("-shared")
            .arg(format!("-std={}", version.unix_flag_value()))
            .arg("-O2")
            .arg("-o")
            .arg(&library)
            .arg("-fPIC")
            .arg(source)
            .args(&self.config.extra_flags);

        let output = run_process(&mut command)?;
        if library.exists() {
            return Ok(library);
        }
        eprintln!("{}", output);
        bail!(
            "{} failed to produce {}",
            compiler.display(),
            library.display()
        );
    }

    fn unix_compiler(&self, language: Language) -> Result<PathBuf> {
        let cell = match language {
            Language::Cpp => &self.unix_cpp,
            Language::C => &self.unix_c,
        };
        let picked = cell.get_or_init(|| self.pick_unix_compiler(language));
        match picked {
            Some(path) => Ok(path.clone()),
            None => bail!(
                "Could not find a native {} compiler (pass --compiler to override)",
                language
            ),
        }
    }

    fn pick_unix_compiler(&self, language: Language) -> Option<PathBuf> {
        if let Some(path) = &self.config.compiler_override {
            return Some(path.clone());
        }
        let prefixes: [&str; 2] = match language {
            Language::Cpp => ["g++", "clang++"],
            Language::C => ["gcc", "clang"],
        };
        let compilers = executables_on_path(|name| prefixes.iter().any(|p| name.starts_with(p)));
        compilers.into_iter().next()
    }

    // ─────────────────────────────────────────────────────────────────────
    // MSVC toolchain
    // ─────────────────────────────────────────────────────────────────────

    fn compile_msvc(&self, version: LanguageVersion, source: &Path) -> Result<PathBuf> {
        let vs = self.visual_studio_environment()?;

        let mut command = Command::new(&vs.cl_exe);
        command
            .arg("/nologo")
            .arg(format!("/std:{}", version.msvc_flag_value()?))
            .arg("/GL")
            .arg("/O2")
            .arg("/EHsc")
            .arg("/DNDEBUG")
            .arg("/LD")
            .arg(source)
            .args(&self.config.extra_flags)
            .envs(&vs.environment);
        if let Some(parent) = source.parent() {
            command.current_dir(parent);
        }

        let output = run_process(&mut command)?;
        let library = source.with_extension("dll");
        if library.exists() {
            return Ok(library);
        }
        eprintln!("{}", output);
        bail!(
            "{} failed to produce {}",
            vs.cl_exe.display(),
            library.display()
        );
    }

    fn visual_studio_environment(&self) -> Result<&VisualStudioEnvironment> {
        let cached = self.visual_studio.get_or_init(|| {
            match compute_visual_studio_environment(&self.config) {
                Ok(environment) => environment,
                Err(err) => {
                    eprintln!("[jit] Visual Studio discovery failed: {:#}", err);
                    None
                }
            }
        });
        match cached {
            Some(environment) => Ok(environment),
            None => bail!("Could not find a native compiler (pass --compiler to override)"),
        }
    }
}

fn executables_on_path(filter: impl Fn(&str) -> bool) -> Vec<PathBuf> {
    let mut results = Vec::new();
    let Some(path_var) = std::env::var_os("PATH") else {
        return results;
    };
    for directory in std::env::split_paths(&path_var) {
        let Ok(entries) = fs::read_dir(&directory) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if path.is_file() && filter(name) && is_executable(&path) {
                results.push(path);
            }
        }
    }
    results
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}

/// Run a command, capturing stdout and stderr as one string.
fn run_process(command: &mut Command) -> Result<String> {
    let output = command
        .output()
        .with_context(|| format!("Failed to execute {:?}", command.get_program()))?;
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(text)
}

fn compute_visual_studio_environment(
    config: &ToolchainConfig,
) -> Result<Option<VisualStudioEnvironment>> {
    let Some(vcvars) = pick_vcvars_script(config)? else {
        return Ok(None);
    };

    let capture_dir = tempfile::tempdir().context("Failed to create capture directory")?;
    let before_file = capture_dir.path().join("env-before.txt");
    let after_file = capture_dir.path().join("env-after.txt");
    let cl_file = capture_dir.path().join("cl-path.txt");
    let script = capture_dir.path().join("capture.bat");

    let lines = [
        format!("set > \"{}\"", before_file.display()),
        format!("call \"{}\"", vcvars.display()),
        format!("set > \"{}\"", after_file.display()),
        format!("where cl.exe > \"{}\"", cl_file.display()),
    ];
    fs::write(&script, lines.join("\r\n")).context("Failed to write capture script")?;

    let output = run_process(Command::new("cmd.exe").arg("/C").arg(&script))?;

    let before = fs::read_to_string(&before_file).unwrap_or_default();
    let after = fs::read_to_string(&after_file).unwrap_or_default();
    let cl_text = fs::read_to_string(&cl_file).unwrap_or_default();
    if before.is_empty() || after.is_empty() || cl_text.trim().is_empty() {
        eprintln!("{}", output);
        return Ok(None);
    }

    let environment = environment_difference(&env_lines_to_map(&before), &env_lines_to_map(&after));
    let cl_exe = PathBuf::from(cl_text.trim());
    if !cl_exe.is_file() {
        return Ok(None);
    }
    Ok(Some(VisualStudioEnvironment { cl_exe, environment }))
}

fn pick_vcvars_script(config: &ToolchainConfig) -> Result<Option<PathBuf>> {
    if let Some(path) = &config.compiler_override {
        return Ok(Some(path.clone()));
    }

    let output = run_process(Command::new(VSWHERE_PATH).args([
        "-sort",
        "-prerelease",
        "-property",
        "installationPath",
    ]))?;

    let script_name = format!("{}.bat", Arch::current()?.vcvars_script());
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let batch = Path::new(line)
            .join("VC")
            .join("Auxiliary")
            .join("Build")
            .join(&script_name);
        if batch.exists() {
            return Ok(Some(batch));
        }
    }
    Ok(None)
}

fn env_lines_to_map(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in text.lines() {
        if let Some(eq) = line.find('=') {
            map.insert(
                line[..eq].trim().to_string(),
                line[eq + 1..].trim().to_string(),
            );
        }
    }
    map
}

/// Variables `vcvars` added or changed.
fn environment_difference(
    before: &HashMap<String, String>,
    after: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut difference = HashMap::new();
    for (key, new_value) in after {
        match before.get(key) {
            Some(old_value) if old_value == new_value => {}
            _ => {
                difference.insert(key.clone(), new_value.clone());
            }
        }
    }
    difference
}
