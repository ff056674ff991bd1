use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use tracing::{debug, info};

use crate::error::{Result, SampleError};
use crate::job::{Job, OutputFormat, Policy};

#[derive(Embed)]
#[folder = "assets/templates/"]
struct TemplateAssets;

pub const LINE_ENDING: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Lowercased letters and digits, with spaces and underscores mapped to `_`.
/// Everything else is dropped.
pub fn sanitize_identifier(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if ch == ' ' || ch == '_' {
            out.push('_');
        }
    }
    out
}

/// File name for one policy's sample, e.g. `basic_8_comp8_1000.txt`.
pub fn artifact_name(job: &Job, policy: &Policy) -> String {
    let stem = sanitize_identifier(&format!(
        "{}_{}_{}",
        job.name, policy.name, job.sample_size
    ));
    format!("{stem}.{}", job.output.extension())
}

/// Template for `format`, preferring a user copy in the config directory.
pub fn load_template(format: OutputFormat) -> Result<String> {
    let filename = format!("{}.{}", format_key(format), format.extension());

    if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join("ampasamp").join("templates").join(&filename);
        if let Ok(content) = fs::read_to_string(&user_path) {
            debug!("Using template {}", user_path.display());
            return Ok(content);
        }
    }

    TemplateAssets::get(&filename)
        .and_then(|file| String::from_utf8(file.data.into_owned()).ok())
        .ok_or(SampleError::TemplateUnavailable(filename))
}

fn format_key(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Plain => "plain",
        OutputFormat::Json => "json",
        OutputFormat::Coq => "coq",
    }
}

pub fn render(job: &Job, policy: &Policy, candidates: &[String]) -> Result<String> {
    match job.output {
        OutputFormat::Plain => Ok(candidates.join(LINE_ENDING)),
        OutputFormat::Json => Ok(serde_json::to_string(candidates)?),
        OutputFormat::Coq => {
            let template = load_template(OutputFormat::Coq)?;
            let name = sanitize_identifier(&format!("{}_{}", job.name, policy.name));
            Ok(render_coq(&template, &name, candidates))
        }
    }
}

/// Fills `%NAME` and `%PASSWORDS` in a Coq template. Candidates become
/// string literals with embedded quotes doubled.
pub fn render_coq(template: &str, name: &str, candidates: &[String]) -> String {
    let literals: Vec<String> = candidates
        .iter()
        .map(|c| format!("\"{}\"", c.replace('"', "\"\"")))
        .collect();
    let separator = format!(";{LINE_ENDING}  ");
    template
        .replace("%NAME", name)
        .replace("%PASSWORDS", &literals.join(&separator))
}

/// Renders and writes one artifact under `dir`, replacing any previous file
/// atomically. Returns the written path.
pub fn write_artifact(dir: &Path, job: &Job, policy: &Policy, candidates: &[String]) -> Result<PathBuf> {
    let content = render(job, policy, candidates)?;
    fs::create_dir_all(dir)?;

    let path = dir.join(artifact_name(job, policy));
    let tmp_path = path.with_extension(format!("{}.tmp", job.output.extension()));

    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp_path, &path)?;

    info!("Wrote {} candidates to {}", candidates.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(output: OutputFormat) -> Job {
        Job {
            name: "Basic 8".to_string(),
            sample_size: 1000,
            output,
            cull_non_ascii: false,
            cull_non_printable: false,
            deduplicate: false,
            randomize_initial: false,
            randomize_each_sample: false,
            policies: vec![],
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("Basic 8_Comp-8!"), "basic_8_comp8");
        assert_eq!(sanitize_identifier("  "), "__");
        assert_eq!(sanitize_identifier("Ünïcode"), "ünïcode");
        assert_eq!(sanitize_identifier("a.b/c"), "abc");
    }

    #[test]
    fn test_artifact_name_per_format() {
        let policy = Policy::named("Comp 8");
        assert_eq!(
            artifact_name(&job(OutputFormat::Plain), &policy),
            "basic_8_comp_8_1000.txt"
        );
        assert_eq!(
            artifact_name(&job(OutputFormat::Json), &policy),
            "basic_8_comp_8_1000.json"
        );
        assert_eq!(
            artifact_name(&job(OutputFormat::Coq), &policy),
            "basic_8_comp_8_1000.v"
        );
    }

    #[test]
    fn test_render_plain_and_json() {
        let policy = Policy::named("p");
        let candidates = strings(&["one", "t\"wo"]);

        let plain = render(&job(OutputFormat::Plain), &policy, &candidates).unwrap();
        assert_eq!(plain, format!("one{LINE_ENDING}t\"wo"));

        let json = render(&job(OutputFormat::Json), &policy, &candidates).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, candidates);
    }

    #[test]
    fn test_render_coq_substitutes_placeholders() {
        let rendered = render_coq(
            "Definition %NAME := [\n  %PASSWORDS\n].",
            "basic_p",
            &strings(&["a1", "say \"hi\""]),
        );
        assert_eq!(
            rendered,
            format!("Definition basic_p := [\n  \"a1\";{LINE_ENDING}  \"say \"\"hi\"\"\"\n].")
        );
    }

    #[test]
    fn test_render_coq_empty_sample() {
        assert_eq!(render_coq("[%PASSWORDS]", "n", &[]), "[]");
    }

    #[test]
    fn test_bundled_coq_template_has_placeholders() {
        let file = TemplateAssets::get("coq.v").unwrap();
        let template = std::str::from_utf8(file.data.as_ref()).unwrap();
        assert!(template.contains("%NAME"));
        assert!(template.contains("%PASSWORDS"));
    }

    #[test]
    fn test_write_artifact_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(OutputFormat::Plain);
        let policy = Policy::named("p");

        let path = write_artifact(dir.path(), &job, &policy, &strings(&["old"])).unwrap();
        write_artifact(dir.path(), &job, &policy, &strings(&["new", "er"])).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("new{LINE_ENDING}er")
        );
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }
}
