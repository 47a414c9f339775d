use clap::builder::TypedValueParser;
use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use stubby_gateway::telemetry::LogFormat;

pub const LISTEN_ADDR_ENV: &str = "STUBBY_GATEWAY_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "STUBBY_GATEWAY_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "STUBBY_GATEWAY_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "STUBBY_GATEWAY_MYSQL_DSN";
pub const GENERATOR_ENV: &str = "STUBBY_GATEWAY_GENERATOR";
pub const CODE_LENGTH_ENV: &str = "STUBBY_GATEWAY_CODE_LENGTH";
pub const SEQUENCE_PREFIX_ENV: &str = "STUBBY_GATEWAY_SEQUENCE_PREFIX";
pub const MAX_ATTEMPTS_ENV: &str = "STUBBY_GATEWAY_MAX_ATTEMPTS";
pub const LOG_FORMAT_ENV: &str = "STUBBY_GATEWAY_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_SEQUENCE_PREFIX: &str = "st";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeneratorArg {
    #[value(name = "random")]
    Random,
    #[value(name = "sequential")]
    Sequential,
}

impl Display for GeneratorArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorArg::Random => write!(f, "random"),
            GeneratorArg::Sequential => write!(f, "sequential"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "stubby-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Base URL short links are rendered against.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(
        long,
        env = GENERATOR_ENV,
        value_enum,
        default_value_t = GeneratorArg::Random
    )]
    pub generator: GeneratorArg,

    /// Length of random codes.
    #[arg(
        long,
        env = CODE_LENGTH_ENV,
        default_value_t = stubby_generator::random::DEFAULT_LENGTH,
        value_parser = clap::value_parser!(u8).range(1..=64).map(usize::from)
    )]
    pub code_length: usize,

    #[arg(long, env = SEQUENCE_PREFIX_ENV, default_value = DEFAULT_SEQUENCE_PREFIX)]
    pub sequence_prefix: String,

    /// Generated candidates tried before a create fails.
    #[arg(
        long,
        env = MAX_ATTEMPTS_ENV,
        default_value_t = stubby_registry::settings::DEFAULT_MAX_ATTEMPTS
    )]
    pub max_attempts: usize,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,
}
