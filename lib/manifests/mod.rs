mod build;

pub use self::build::{BuildManifest, DEV_MANIFEST_FILE_NAME, PROD_MANIFEST_FILE_NAME};
