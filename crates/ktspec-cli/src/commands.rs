//! Non-interactive subcommands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::eyre::{bail, eyre, Result};
use indicatif::{ProgressBar, ProgressStyle};
use ktspec_core::{
    gutter, Config, Project, RunMode, RunRequest, SourceFile, Spec, SpecDiscovery, TestElement,
};

fn discovery(config: &Config) -> SpecDiscovery {
    SpecDiscovery::from_config(&config.discovery)
}

fn parse(discovery: &SpecDiscovery, file: &Path) -> Result<SourceFile> {
    Ok(discovery.parse_path(file)?)
}

/// `ktspec tests`
pub fn tests(config: &Config, file: &Path, json: bool) -> Result<()> {
    let discovery = discovery(config);
    let source = parse(&discovery, file)?;
    let specs = discovery.specs(&source);

    if json {
        println!("{}", serde_json::to_string_pretty(&specs)?);
        return Ok(());
    }

    if specs.is_empty() {
        println!("No Kotest specs in {}", file.display());
        return Ok(());
    }
    for spec in &specs {
        print_spec(spec);
    }
    Ok(())
}

fn print_spec(spec: &Spec) {
    println!("{} [{}]  ({})", spec.name, spec.style, spec.fqn);
    for element in &spec.tests {
        print_element(element, 1);
    }
}

fn print_element(element: &TestElement, depth: usize) {
    let test = &element.test;
    let mut flags = Vec::new();
    if test.disabled {
        flags.push("disabled");
    }
    if test.name.interpolated {
        flags.push("interpolated");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!("  ({})", flags.join(", "))
    };

    println!(
        "{}{} {}  :{}{}",
        "  ".repeat(depth),
        test.test_type,
        test.name,
        test.anchor.line(),
        flags
    );
    for child in &element.nested {
        print_element(child, depth + 1);
    }
}

/// `ktspec at`
pub fn at(config: &Config, file: &Path, line: u32, column: u32) -> Result<()> {
    let discovery = discovery(config);
    let source = parse(&discovery, file)?;
    let offset = source
        .byte_offset(line, column)
        .ok_or_else(|| eyre!("{}:{}:{} is outside the file", file.display(), line, column))?;

    match discovery.enclosing(&source, offset) {
        Some(location) => println!("{}", serde_json::to_string_pretty(&location)?),
        None => println!("No spec at {}:{}", file.display(), line),
    }
    Ok(())
}

/// `ktspec markers`
pub fn markers(config: &Config, file: &Path, json: bool) -> Result<()> {
    let discovery = discovery(config);
    let source = parse(&discovery, file)?;
    let markers = gutter::markers(&discovery, &source);

    if json {
        println!("{}", serde_json::to_string_pretty(&markers)?);
        return Ok(());
    }
    for marker in &markers {
        println!("{:>5}  {:<8} {}", marker.line, marker.kind, marker.label);
    }
    Ok(())
}

/// `ktspec run`
pub fn run(config: &Config, file: &Path, line: u32, mode: &str) -> Result<()> {
    let Some(mode) = RunMode::parse(mode) else {
        bail!("unknown mode '{}', expected run, debug or coverage", mode);
    };

    let discovery = discovery(config);
    let source = parse(&discovery, file)?;
    let offset = source
        .byte_offset(line, 1)
        .ok_or_else(|| eyre!("line {} is outside {}", line, file.display()))?;
    // Markers sit at the test name, which is rarely in column one.
    let offset = source
        .content()
        .get(offset..)
        .and_then(|rest| rest.find(|c: char| !c.is_whitespace()))
        .map_or(offset, |skip| offset + skip);

    let location = discovery
        .enclosing(&source, offset)
        .ok_or_else(|| eyre!("no spec at {}:{}", file.display(), line))?;

    let file = Some(file.to_path_buf());
    let request = match &location.test {
        Some(test) => RunRequest::for_test(mode, file, &location.spec_fqn, test),
        None => RunRequest::for_spec(mode, file, &location.spec_fqn, line),
    };

    println!("{}: {}", request.mode, request.name());
    println!("{}", request.command_line(&config.run));
    Ok(())
}

/// `ktspec stub`
pub fn stub(config: &Config, style: &str, name: &str, spec: &str) -> Result<()> {
    let discovery = discovery(config);
    let Some(style) = discovery.registry().style_by_name(style) else {
        let known: Vec<_> = discovery
            .registry()
            .list_styles()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        bail!("unknown style '{}', expected one of: {}", style, known.join(", "));
    };
    println!("{}", style.generate_test(spec, name));
    Ok(())
}

/// `ktspec styles`
pub fn styles(config: &Config) -> Result<()> {
    let discovery = discovery(config);
    for (name, fqn) in discovery.registry().list_styles() {
        println!("{:<16} {}", name, fqn);
    }
    Ok(())
}

/// `ktspec scan`
pub fn scan(config: &Config, root: &Path, json: bool) -> Result<()> {
    let project = Project::open(root, &config.discovery)?;

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Scanning {}", project.root().display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let index = project.index(&discovery(config));
    spinner.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&index)?);
        return Ok(());
    }

    for (module, files) in index.by_module() {
        println!("{}", module);
        for file in files {
            for spec in &file.specs {
                println!(
                    "  {} [{}]  {} tests  ({})",
                    spec.fqn,
                    spec.style,
                    spec.test_count(),
                    file.relative_path
                );
            }
        }
    }
    println!(
        "\n{} files scanned, {} specs, {} tests",
        index.files_scanned,
        index.spec_count(),
        index.test_count()
    );
    Ok(())
}

/// `ktspec explore`
pub async fn explore(config: Config, root: &Path, files: Vec<PathBuf>) -> Result<()> {
    let project = Project::open(root, &config.discovery)?;
    let files = files
        .into_iter()
        .map(|f| f.canonicalize().unwrap_or(f))
        .collect();

    crate::tui::run(config, project, files)
        .await
        .map_err(|e| eyre!("explorer failed: {}", e))
}
