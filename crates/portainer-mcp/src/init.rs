use std::path::Path;

use anyhow::{bail, Context};
use clap::Args;

/// Options for `portainer-mcp init`.
#[derive(Debug, Clone, Args)]
pub struct InitArgs {
    /// Portainer server address to register (the token is read from PORTAINER_TOKEN at runtime)
    #[arg(long)]
    pub server: String,

    /// Register the server in read-only mode
    #[arg(long)]
    pub read_only: bool,

    /// Register the server with TLS verification disabled
    #[arg(long)]
    pub skip_tls_verify: bool,
}

impl InitArgs {
    fn server_args(&self) -> Vec<String> {
        let mut args = vec!["--server".to_string(), self.server.clone()];
        if self.read_only {
            args.push("--read-only".to_string());
        }
        if self.skip_tls_verify {
            args.push("--skip-tls-verify".to_string());
        }
        args
    }
}

/// Write project-scoped MCP config files in the current directory so that
/// Claude Code and/or Codex discover portainer-mcp when working in this project.
/// Only writes config for tools that are actually installed.
pub fn init_project(args: &InitArgs) -> anyhow::Result<()> {
    let binary_path = std::env::current_exe()?
        .canonicalize()?
        .to_string_lossy()
        .to_string();

    let cwd = std::env::current_dir()?;

    let has_claude = which("claude");
    let has_codex = which("codex");

    if !has_claude && !has_codex {
        bail!(
            "Neither `claude` nor `codex` found in PATH. Install Claude Code or OpenAI Codex first, then re-run `portainer-mcp init`."
        );
    }

    let server_args = args.server_args();

    if has_claude {
        init_claude_code(&cwd, &binary_path, &server_args)?;
    }
    if has_codex {
        init_codex(&cwd, &binary_path, &server_args)?;
    }

    let tools: Vec<&str> = [
        if has_claude { Some("Claude Code") } else { None },
        if has_codex { Some("Codex") } else { None },
    ]
    .into_iter()
    .flatten()
    .collect();
    eprintln!(
        "\nDone. {} will use portainer-mcp in this project. Export PORTAINER_TOKEN before starting it.",
        tools.join(" and ")
    );

    Ok(())
}

fn which(name: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths).any(|dir| {
                let candidate = dir.join(name);
                candidate.is_file() || dir.join(format!("{name}.exe")).is_file()
            })
        })
        .unwrap_or(false)
}

/// Write .mcp.json for Claude Code, merging with any existing config.
fn init_claude_code(cwd: &Path, binary_path: &str, server_args: &[String]) -> anyhow::Result<()> {
    let mcp_json_path = cwd.join(".mcp.json");
    let mut root: serde_json::Value = if mcp_json_path.exists() {
        let contents = std::fs::read_to_string(&mcp_json_path)?;
        serde_json::from_str(&contents)
            .with_context(|| format!("{} is not valid JSON", mcp_json_path.display()))?
    } else {
        serde_json::json!({})
    };

    let Some(root_map) = root.as_object_mut() else {
        bail!("{} must contain a JSON object", mcp_json_path.display());
    };
    let servers = root_map
        .entry("mcpServers")
        .or_insert_with(|| serde_json::json!({}));
    let Some(servers) = servers.as_object_mut() else {
        bail!("`mcpServers` in {} must be an object", mcp_json_path.display());
    };
    servers.insert(
        "portainer".to_string(),
        serde_json::json!({
            "type": "stdio",
            "command": binary_path,
            "args": server_args,
        }),
    );

    std::fs::write(&mcp_json_path, serde_json::to_string_pretty(&root)?)?;
    eprintln!("Wrote {}", mcp_json_path.display());
    Ok(())
}

/// Write .codex/config.toml for OpenAI Codex, merging with any existing config.
fn init_codex(cwd: &Path, binary_path: &str, server_args: &[String]) -> anyhow::Result<()> {
    let codex_dir = cwd.join(".codex");
    let config_toml_path = codex_dir.join("config.toml");

    let mut doc: toml_edit::DocumentMut = if config_toml_path.exists() {
        std::fs::read_to_string(&config_toml_path)?
            .parse()
            .with_context(|| format!("{} is not valid TOML", config_toml_path.display()))?
    } else {
        toml_edit::DocumentMut::new()
    };

    if !doc.contains_key("mcp_servers") {
        doc["mcp_servers"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    let Some(servers) = doc["mcp_servers"].as_table_like_mut() else {
        bail!("`mcp_servers` in {} must be a table", config_toml_path.display());
    };

    let mut args = toml_edit::Array::new();
    for arg in server_args {
        args.push(arg.as_str());
    }
    let mut server = toml_edit::Table::new();
    server.insert("command", toml_edit::value(binary_path));
    server.insert("args", toml_edit::value(args));
    servers.insert("portainer", toml_edit::Item::Table(server));

    std::fs::create_dir_all(&codex_dir)?;
    std::fs::write(&config_toml_path, doc.to_string())?;
    eprintln!("Wrote {}", config_toml_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIN: &str = "/usr/bin/portainer-mcp";

    fn init_args(read_only: bool) -> InitArgs {
        InitArgs {
            server: "portainer.local:9443".to_string(),
            read_only,
            skip_tls_verify: false,
        }
    }

    #[test]
    fn server_args_carry_mode_flags() {
        assert_eq!(
            init_args(true).server_args(),
            vec!["--server", "portainer.local:9443", "--read-only"]
        );
        assert_eq!(init_args(false).server_args().len(), 2);
    }

    #[test]
    fn claude_config_merges_with_existing_servers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".mcp.json"),
            r#"{"mcpServers":{"other":{"command":"x"}}}"#,
        )
        .unwrap();

        init_claude_code(dir.path(), BIN, &init_args(true).server_args()).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(".mcp.json")).unwrap())
                .unwrap();
        assert_eq!(written["mcpServers"]["other"]["command"], "x");
        let entry = &written["mcpServers"]["portainer"];
        assert_eq!(entry["command"], "/usr/bin/portainer-mcp");
        assert_eq!(
            entry["args"],
            serde_json::json!(["--server", "portainer.local:9443", "--read-only"])
        );
        assert!(!written.to_string().contains("PORTAINER_TOKEN="));
    }

    #[test]
    fn claude_config_rejects_non_object_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".mcp.json");
        std::fs::write(&path, "[]").unwrap();

        let err = init_claude_code(dir.path(), BIN, &init_args(false).server_args()).unwrap_err();
        assert!(err.to_string().contains(".mcp.json"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");

        std::fs::write(&path, r#"{"mcpServers":"x"}"#).unwrap();
        assert!(init_claude_code(dir.path(), BIN, &init_args(false).server_args()).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"mcpServers":"x"}"#);
    }

    #[test]
    fn claude_config_left_untouched_when_unparseable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".mcp.json");
        let malformed = r#"{"mcpServers":{"other":{"command":"x"}},}"#;
        std::fs::write(&path, malformed).unwrap();

        let err = init_claude_code(dir.path(), BIN, &init_args(false).server_args()).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), malformed);
    }

    #[test]
    fn codex_config_left_untouched_when_unparseable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".codex")).unwrap();
        let path = dir.path().join(".codex/config.toml");
        let malformed = "[mcp_servers.other]\ncommand = \"x\"\nargs = [\n";
        std::fs::write(&path, malformed).unwrap();

        let err = init_codex(dir.path(), BIN, &init_args(false).server_args()).unwrap_err();
        assert!(err.to_string().contains("not valid TOML"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), malformed);

        std::fs::write(&path, "mcp_servers = 5\n").unwrap();
        assert!(init_codex(dir.path(), BIN, &init_args(false).server_args()).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "mcp_servers = 5\n");
    }

    #[test]
    fn codex_config_keeps_existing_servers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".codex")).unwrap();
        let path = dir.path().join(".codex/config.toml");
        std::fs::write(&path, "model = \"o3\"\n\n[mcp_servers.other]\ncommand = \"x\"\n").unwrap();

        init_codex(dir.path(), BIN, &init_args(true).server_args()).unwrap();

        let doc: toml_edit::DocumentMut = std::fs::read_to_string(&path).unwrap().parse().unwrap();
        assert_eq!(doc["model"].as_str(), Some("o3"));
        assert_eq!(doc["mcp_servers"]["other"]["command"].as_str(), Some("x"));
        assert_eq!(
            doc["mcp_servers"]["portainer"]["args"].as_array().map(|a| a.len()),
            Some(3)
        );
    }

    #[test]
    fn codex_config_adds_server_table() {
        let dir = tempfile::tempdir().unwrap();

        init_codex(dir.path(), BIN, &init_args(false).server_args()).unwrap();

        let written = std::fs::read_to_string(dir.path().join(".codex/config.toml")).unwrap();
        let doc: toml_edit::DocumentMut = written.parse().unwrap();
        assert_eq!(
            doc["mcp_servers"]["portainer"]["command"].as_str(),
            Some("/usr/bin/portainer-mcp")
        );
        let args = doc["mcp_servers"]["portainer"]["args"].as_array().unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(0).and_then(|v| v.as_str()), Some("--server"));
    }
}
