//! Helpers around [`figment::Jail`].

use anyhow::{Result, anyhow};
use camino::Utf8PathBuf;
use serde_json::Value;

/// Run `f` inside a fresh jail and return its output.
///
/// The jail is torn down even when `f` fails.
///
/// # Errors
///
/// Returns an error if the jail cannot be created or `f` fails.
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|j| {
        output = Some(f(j)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Write `document` as pretty JSON to `name` inside the jail and return the
/// absolute path of the new file.
///
/// # Errors
///
/// Fails when the document cannot be encoded or the file cannot be written.
pub fn write_json(
    jail: &mut figment::Jail,
    name: &str,
    document: &Value,
) -> figment::error::Result<Utf8PathBuf> {
    let text = serde_json::to_string_pretty(document).map_err(|e| e.to_string())?;
    write_text(jail, name, &text)
}

/// Write raw `text` to `name` inside the jail and return its absolute path.
///
/// # Errors
///
/// Fails when the file cannot be written or the jail directory is not UTF-8.
pub fn write_text(
    jail: &mut figment::Jail,
    name: &str,
    text: &str,
) -> figment::error::Result<Utf8PathBuf> {
    jail.create_file(name, text).map_err(|e| e.to_string())?;
    let dir = Utf8PathBuf::from_path_buf(jail.directory().to_path_buf())
        .map_err(|p| format!("jail directory is not UTF-8: {}", p.display()))?;
    Ok(dir.join(name))
}
