use postgresql_embedded::blocking::PostgreSQL;

use crate::config::ConnectOptions;

/// A running embedded PostgreSQL instance.
pub struct EmbeddedPostgres {
    pub postgresql: PostgreSQL,
    pub port: u16,
    /// Connection options rewritten to reach the embedded server.
    pub options: ConnectOptions,
}

/// Set up an embedded PostgreSQL instance for tests.
///
/// Starts a server on a free port, creates the database named in `options`,
/// and returns options rewritten with the embedded server's host, port, and
/// credentials. The log level carries over unchanged.
///
/// # Errors
/// Returns an error if the embedded server cannot be set up or started, or
/// if database provisioning fails.
pub fn setup_postgres_embedded(
    options: &ConnectOptions,
) -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    let mut postgresql = PostgreSQL::default();

    // Provision the binaries and start the instance
    postgresql.setup()?;
    postgresql.start()?;

    let settings = postgresql.settings().clone();
    let dbname = options
        .dbname
        .clone()
        .ok_or("dbname is required to provision the test database")?;
    postgresql.create_database(&dbname)?;

    let mut rewritten = options.clone();
    rewritten.host = Some(settings.host.clone());
    rewritten.port = Some(settings.port);
    rewritten.user = Some(settings.username.clone());
    rewritten.password = Some(settings.password.clone());

    println!("PostgreSQL started on port {}", settings.port);

    Ok(EmbeddedPostgres {
        port: settings.port,
        postgresql,
        options: rewritten,
    })
}

/// Stop a previously started embedded PostgreSQL instance.
pub fn stop_postgres_embedded(postgres: EmbeddedPostgres) {
    let _ = postgres.postgresql.stop();
}
