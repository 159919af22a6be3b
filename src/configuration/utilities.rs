use std::{collections::HashMap, env::current_dir, path::PathBuf};

use miette::{miette, Context, IntoDiagnostic, Result};


/// Returns the default data directory, which is `{current directory}/data`.
///
/// The directory does not need to exist yet.
pub fn get_default_data_directory_path() -> Result<PathBuf> {
    let mut data_directory_path = current_dir()
        .into_diagnostic()
        .wrap_err_with(|| miette!("Could not get the current directory."))?;
    data_directory_path.push("data");

    Ok(data_directory_path)
}

#[must_use = "function returns the modified path"]
pub fn replace_placeholders_in_path<S>(
    original_path: S,
    placeholders: HashMap<&'static str, String>,
) -> PathBuf
where
    S: Into<String>,
{
    let mut path_string: String = original_path.into();

    for (key, value) in placeholders.into_iter() {
        path_string = path_string.replace(key, &value);
    }

    PathBuf::from(path_string)
}
