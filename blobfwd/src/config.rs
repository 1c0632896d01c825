use std::path::Path;

use crate::event::PayloadSchema;
use crate::routing::RoutingTable;
use crate::storage::driver::s3::S3Config;
use crate::storage::paths::validate_segment;
use crate::utils::cli::Args;

#[derive(Clone, Debug)]
pub enum StorageKind {
    Filesystem { root: String },
    S3(S3Config),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub storage: StorageKind,
    pub container: String,
    pub log_container: String,
    pub log_object: String,
    pub routes: RoutingTable,
    pub schema: PayloadSchema,
}

/// Checks every setting and reports all problems at once.
pub async fn validate_config(args: &Args) -> anyhow::Result<Config> {
    let mut validation_errors = Vec::new();

    let storage = match args.storage.to_ascii_uppercase().as_str() {
        "FILESYSTEM" => {
            match tokio::fs::metadata(Path::new(&args.root)).await {
                Ok(meta) if meta.is_dir() => {}
                Ok(_) => validation_errors.push(format!(
                    "BLOBFWD_ROOTDIR `{}` exists but is not a directory",
                    args.root,
                )),
                Err(_) => validation_errors.push(format!(
                    "BLOBFWD_ROOTDIR `{}` does not exist.",
                    args.root,
                )),
            }
            Some(StorageKind::Filesystem {
                root: args.root.clone(),
            })
        }
        "S3" => Some(StorageKind::S3(S3Config {
            endpoint_url: args.s3_endpoint.clone(),
            region: args.s3_region.clone(),
        })),
        other => {
            validation_errors.push(format!(
                "BLOBFWD_STORAGE `{other}` is not supported, use FILESYSTEM or S3"
            ));
            None
        }
    };

    for (var, value) in [
        ("BLOBFWD_CONTAINER", &args.container),
        ("BLOBFWD_LOG_CONTAINER", &args.log_container),
        ("BLOBFWD_LOG_OBJECT", &args.log_object),
    ] {
        if value.trim().is_empty() {
            validation_errors.push(format!("{var} must not be empty"));
        } else if matches!(storage, Some(StorageKind::Filesystem { .. }))
            && validate_segment(value).is_err()
        {
            validation_errors.push(format!(
                "{var} `{value}` must be a single path segment for the FILESYSTEM backend"
            ));
        }
    }

    let routes = match (&args.routes_file, &args.routes) {
        (Some(path), _) => RoutingTable::from_yaml_file(path),
        (None, Some(inline)) => RoutingTable::parse_inline(inline),
        (None, None) => {
            tracing::warn!("no routing table configured, using the built-in default");
            Ok(RoutingTable::default())
        }
    };
    let routes = routes
        .map_err(|e| validation_errors.push(format!("routing table: {e:#}")))
        .ok();

    let schema = PayloadSchema::new(&args.url_pointer, &args.data_type_pointer);
    if let Err(e) = schema.validate() {
        validation_errors.push(e);
    }

    match (storage, routes) {
        (Some(storage), Some(routes)) if validation_errors.is_empty() => Ok(Config {
            storage,
            container: args.container.clone(),
            log_container: args.log_container.clone(),
            log_object: args.log_object.clone(),
            routes,
            schema,
        }),
        _ => anyhow::bail!("{}", validation_errors.join("\n")),
    }
}
