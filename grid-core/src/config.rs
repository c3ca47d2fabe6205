//! data-grid client process configs

pub mod cli {
    //! Parse from either cli or env var

    /// the default path to the client properties
    pub static DEFAULT_PROPERTIES_PATH: &str = "/var/lib/grid-client/client.yaml";
    /// port cluster members listen on unless told otherwise
    pub const DEFAULT_MEMBER_PORT: u16 = 5701;
    /// tokio worker thread name
    pub static DEFAULT_THREAD_NAME: &str = "grid-client-worker";
    /// default log level. Can use this argument or GRID_LOG env var
    pub const DEFAULT_GRID_LOG: &str = "info";
    /// log as "json", "pretty" or "standard" (unstructured)
    pub static DEFAULT_LOG_FORMAT: &str = "standard";

    use std::path::PathBuf;

    pub use clap::Parser;

    #[derive(Parser, Debug, Clone, PartialEq, Eq)]
    #[clap(author, name = "grid-client", bin_name = "grid-client", about, long_about = None)]
    /// parses from cli & environment var. A `.env` in the working dir is loaded as well
    pub struct Config {
        /// path to the client properties (json or yaml)
        #[clap(
            short,
            long,
            value_parser,
            env,
            default_value = DEFAULT_PROPERTIES_PATH
        )]
        pub properties_path: PathBuf,
        /// DNS name under which the service registry publishes cluster members,
        /// ex. "grid.service.consul"
        #[clap(long, env, value_parser)]
        pub discovery_name: Option<String>,
        /// port discovered members listen on
        #[clap(long, env, value_parser, default_value_t = DEFAULT_MEMBER_PORT)]
        pub member_port: u16,
        /// comma separated `ip:port` member list, used when no discovery name is set
        #[clap(long, env, value_parser)]
        pub static_members: Option<String>,
        /// Worker thread name
        #[clap(long, env, value_parser, default_value = DEFAULT_THREAD_NAME)]
        pub thread_name: String,
        /// number of worker threads, defaults to the number of logical CPUs
        #[clap(long, env, value_parser)]
        pub threads: Option<usize>,
        /// set the log level. All valid RUST_LOG arguments are accepted
        #[clap(long, env, value_parser, default_value = DEFAULT_GRID_LOG)]
        pub grid_log: String,
        /// log output format: "standard", "json" or "pretty"
        #[clap(long, env, value_parser, default_value = DEFAULT_LOG_FORMAT)]
        pub log_format: String,
    }

}

pub mod trace {
    //! tracing configuration
    use anyhow::Result;
    use tracing_subscriber::{
        filter::EnvFilter,
        fmt::{
            self,
            format::{Format, PrettyFields},
        },
        prelude::__tracing_subscriber_SubscriberExt,
        util::SubscriberInitExt,
    };

    /// Configuration for the tracing subscriber
    #[derive(Debug)]
    pub struct Config {
        /// formatting to apply to logs
        pub log_frmt: String,
    }

    impl Config {
        /// install the global subscriber, filtering with `grid_log`
        pub fn parse(grid_log: &str, log_frmt: &str) -> Result<Self> {
            let filter = EnvFilter::try_new(grid_log)
                .or_else(|_| EnvFilter::try_new("info"))?
                .add_directive("hickory_proto=warn".parse()?);

            match log_frmt {
                "json" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().json())
                        .init();
                }
                "pretty" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(
                            fmt::layer()
                                .event_format(
                                    Format::default().pretty().with_source_location(false),
                                )
                                .fmt_fields(PrettyFields::new()),
                        )
                        .init();
                }
                _ => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer())
                        .init();
                }
            }

            Ok(Self {
                log_frmt: log_frmt.to_owned(),
            })
        }
    }
}
