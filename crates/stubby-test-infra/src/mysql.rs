use crate::Result;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const MYSQL_PORT: u16 = 3306;

/// Account and image used for a [`MySqlServer`].
///
/// The defaults match the `links` database the storage tests expect.
#[derive(Debug, Clone, TypedBuilder)]
pub struct MySqlSettings {
    #[builder(default = "links".to_string(), setter(into))]
    pub database: String,
    #[builder(default = "stubby".to_string(), setter(into))]
    pub user: String,
    #[builder(default = "stubby".to_string(), setter(into))]
    pub password: String,
    #[builder(default = "8.4".to_string(), setter(into))]
    pub image_tag: String,
}

impl Default for MySqlSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A throwaway MySQL server backing the storage integration tests.
///
/// The DSN is resolved once the server accepts TCP connections, and the
/// container is stopped when the value is dropped.
pub struct MySqlServer {
    _container: ContainerAsync<GenericImage>,
    dsn: String,
}

impl MySqlServer {
    pub async fn start(settings: MySqlSettings) -> Result<Self> {
        // The entrypoint runs a networkless bootstrap server first, which
        // logs "port: 0"; only the final server listens on 3306.
        let container = GenericImage::new("mysql", &settings.image_tag)
            .with_exposed_port(MYSQL_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr(format!("port: {MYSQL_PORT}")))
            .with_env_var("MYSQL_DATABASE", &settings.database)
            .with_env_var("MYSQL_USER", &settings.user)
            .with_env_var("MYSQL_PASSWORD", &settings.password)
            .with_env_var("MYSQL_RANDOM_ROOT_PASSWORD", "yes")
            .start()
            .await?;

        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(MYSQL_PORT).await?;
        let dsn = format!(
            "mysql://{}:{}@{host}:{port}/{}",
            settings.user, settings.password, settings.database
        );

        Ok(Self {
            _container: container,
            dsn,
        })
    }

    /// Connection string accepted by `MySqlStore::connect`.
    pub fn dsn(&self) -> &str {
        &self.dsn
    }
}
