use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "blobfwd")]
#[command(version, about = "Forwards newly written storage objects to per-type HTTP destinations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Serve the event webhook using ./blobfwd serve")]
    Serve(ServeArgs),
    #[command(about = "Handle one event file (or `-` for stdin) using ./blobfwd handle event.json")]
    Handle {
        #[command(flatten)]
        args: Args,

        #[arg(value_name = "EVENT_FILE")]
        event: String,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ServeArgs {
    /// Webhook listening host
    #[arg(long, env = "BLOBFWD_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Webhook listening port
    #[arg(short, long, env = "BLOBFWD_PORT", default_value_t = 7071)]
    pub port: u16,

    #[command(flatten)]
    pub args: Args,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct Args {
    /// Storage backend type (FILESYSTEM or S3)
    #[arg(short, long, env = "BLOBFWD_STORAGE", default_value = "FILESYSTEM")]
    pub storage: String,

    /// Root directory of the filesystem backend
    #[arg(long, env = "BLOBFWD_ROOTDIR", default_value = "/var/lib/blobfwd")]
    pub root: String,

    /// Endpoint of an S3-compatible service
    #[arg(long, env = "BLOBFWD_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// Region of the S3 backend
    #[arg(long, env = "BLOBFWD_S3_REGION")]
    pub s3_region: Option<String>,

    /// Container holding the objects to forward
    #[arg(long, env = "BLOBFWD_CONTAINER", default_value = "incoming")]
    pub container: String,

    /// Container holding the processing log
    #[arg(long, env = "BLOBFWD_LOG_CONTAINER", default_value = "logs")]
    pub log_container: String,

    /// Object name of the processing log
    #[arg(long, env = "BLOBFWD_LOG_OBJECT", default_value = "processing_logs.json")]
    pub log_object: String,

    /// YAML file mapping data types to destination URLs
    #[arg(long, env = "BLOBFWD_ROUTES_FILE", conflicts_with = "routes")]
    pub routes_file: Option<String>,

    /// Inline routing table: TYPE=URL[,TYPE=URL...]
    #[arg(long, env = "BLOBFWD_ROUTES")]
    pub routes: Option<String>,

    /// JSON pointer to the object URL inside the event data
    #[arg(long, env = "BLOBFWD_URL_POINTER", default_value = "/url")]
    pub url_pointer: String,

    /// JSON pointer to the data type inside the event data
    #[arg(long, env = "BLOBFWD_DATA_TYPE_POINTER", default_value = "/metadata/dataType")]
    pub data_type_pointer: String,
}
