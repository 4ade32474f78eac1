use std::{path::Path, str::FromStr};

use tokio::fs::{create_dir_all, read_to_string, write};
use tracing::error;

use crate::result::{SyncError, SyncResult};

/**
    Loads the given type from the file at the given path.

    Will return an error if the file does not exist or could not be parsed.
*/
pub(crate) async fn load_from_file<P, T, E>(path: P) -> SyncResult<T>
where
    P: AsRef<Path>,
    T: FromStr<Err = E>,
    E: Into<SyncError>,
{
    let path = path.as_ref();
    match read_to_string(path).await {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SyncError::FileNotFound(path.into()))
        }
        Err(e) => Err(e.into()),
        Ok(s) => match s.parse() {
            Ok(t) => Ok(t),
            Err(e) => Err(e.into()),
        },
    }
}

/**
    Saves the given data, stringified, to the file at the given path.

    Any previous contents of the file are replaced entirely.
*/
pub(crate) async fn save_to_file<P, T>(path: P, data: &T) -> SyncResult<()>
where
    P: AsRef<Path>,
    T: ToString,
{
    let path = path.as_ref();
    write(path, data.to_string()).await?;
    Ok(())
}

/**
    Creates the given directory and all of its parents.

    Succeeds without doing anything if the directory already exists.
*/
pub async fn ensure_dir(path: impl AsRef<Path>) -> SyncResult<()> {
    let path = path.as_ref();
    if let Err(e) = create_dir_all(path).await {
        error!("Failed to create directory {path:?}:\n{e}");
        return Err(e.into());
    }
    Ok(())
}

/**
    Writes the given contents verbatim to the file at the given path.
*/
pub async fn write_file(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> SyncResult<()> {
    let path = path.as_ref();
    if let Err(e) = write(path, contents).await {
        error!("Failed to write file to {path:?}:\n{e}");
        return Err(e.into());
    }
    Ok(())
}
