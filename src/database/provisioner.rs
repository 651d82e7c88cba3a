use tracing::{field::Empty, info, instrument, warn};

use crate::config::{Backend, Config, DATABASE_NAME};
use crate::database::report::{Outcome, ProvisionReport, Step, StepReport};
use crate::database::schema::{TableStatement, fitforge_tables};
use crate::database::session::{MySqlSession, SchemaSession, SqliteSession};
use crate::error::{FailureKind, ProvisionError};
use crate::models::{AdminSeed, DEFAULT_ADMIN};

/// Brings a server to the FitForge baseline: database, four tables, one admin.
///
/// Safe to run any number of times. Table failures are reported and skipped;
/// a failed connection, database selection or admin seed stops the run.
pub struct Provisioner {
    config: Config,
    statements: Option<Vec<TableStatement>>,
    seed: AdminSeed,
}

impl Provisioner {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            statements: None,
            seed: DEFAULT_ADMIN,
        }
    }

    /// Replaces the rendered table set.
    pub fn with_tables(mut self, statements: Vec<TableStatement>) -> Self {
        self.statements = Some(statements);
        self
    }

    pub async fn provision(self) -> ProvisionReport {
        match self.config.backend {
            Backend::MySql => {
                let connected = MySqlSession::connect(&self.config).await;
                match connected {
                    Ok(session) => self.run(session).await,
                    Err(err) => connection_failed(Backend::MySql, err.into()),
                }
            }
            Backend::Sqlite => {
                let connected = SqliteSession::connect(&self.config).await;
                match connected {
                    Ok(session) => self.run(session).await,
                    Err(err) => connection_failed(Backend::Sqlite, err.into()),
                }
            }
        }
    }

    /// Runs every step on an already connected session, then closes it.
    #[instrument(skip_all, fields(backend = %session.backend(), database = DATABASE_NAME))]
    pub async fn run<S: SchemaSession>(self, mut session: S) -> ProvisionReport {
        let backend = session.backend();
        let mut report = ProvisionReport::default();
        record(&mut report, backend, Step::Connect, Outcome::Done);

        if self.run_steps(&mut session, &mut report).await.is_err() {
            report.mark_halted();
        }

        if let Err(err) = session.close().await {
            warn!(error = %err, "Connection did not close cleanly; dropped instead");
        }
        record(&mut report, backend, Step::Close, Outcome::Done);

        report
    }

    async fn run_steps<S: SchemaSession>(
        &self,
        session: &mut S,
        report: &mut ProvisionReport,
    ) -> Result<(), ProvisionError> {
        let backend = session.backend();
        let dialect = session.dialect();

        let create_database = match dialect.create_database(DATABASE_NAME) {
            Some(sql) => session.execute(&sql).await.map(|_| ()),
            None => Ok(()),
        };
        halt_on_error(report, backend, Step::CreateDatabase, create_database)?;

        let select_database = match dialect.use_database(DATABASE_NAME) {
            Some(sql) => session.execute(&sql).await.map(|_| ()),
            None => Ok(()),
        };
        halt_on_error(report, backend, Step::SelectDatabase, select_database)?;

        let statements = match &self.statements {
            Some(statements) => statements.clone(),
            None => dialect.render(&fitforge_tables()),
        };
        for statement in &statements {
            let outcome = create_table(session, statement).await;
            record(report, backend, Step::CreateTable(statement.name.clone()), outcome);
        }

        let seeded = self.seed_admin(session).await;
        halt_on_error(report, backend, Step::SeedAdmin, seeded)?;

        let committed = session.execute("COMMIT").await.map(|_| ());
        halt_on_error(report, backend, Step::Commit, committed)?;

        Ok(())
    }

    #[instrument(skip_all, fields(email = self.seed.email))]
    async fn seed_admin<S: SchemaSession>(&self, session: &mut S) -> Result<(), ProvisionError> {
        let password = self.seed.password_for_storage(self.config.admin_password)?;
        session.execute("BEGIN").await?;
        let inserted = session.insert_admin(&self.seed, &password).await?;
        if inserted == 0 {
            info!("Default admin already present; left untouched");
        } else {
            info!("Default admin inserted");
        }
        Ok(())
    }
}

#[instrument(
    skip_all,
    fields(table = %statement.name, error = Empty, error.message = Empty)
)]
async fn create_table<S: SchemaSession>(session: &mut S, statement: &TableStatement) -> Outcome {
    let existed = match session.table_exists(&statement.name).await {
        Ok(existed) => existed,
        Err(err) => return table_failure(err.into()),
    };

    match session.execute(&statement.sql).await {
        Ok(_) if existed => Outcome::AlreadyExists,
        Ok(_) => Outcome::Done,
        Err(err) => table_failure(err.into()),
    }
}

fn table_failure(err: ProvisionError) -> Outcome {
    err.log_and_record("create table");
    match err.kind() {
        FailureKind::AlreadyExists => Outcome::AlreadyExists,
        kind => Outcome::Failed {
            kind,
            message: inner_message(&err),
        },
    }
}

fn halt_on_error<E: Into<ProvisionError>>(
    report: &mut ProvisionReport,
    backend: Backend,
    step: Step,
    result: Result<(), E>,
) -> Result<(), ProvisionError> {
    match result.map_err(Into::into) {
        Ok(()) => {
            record(report, backend, step, Outcome::Done);
            Ok(())
        }
        Err(err) if err.kind() == FailureKind::AlreadyExists => {
            record(report, backend, step, Outcome::AlreadyExists);
            Ok(())
        }
        Err(err) => {
            err.log_and_record(step.as_str());
            let outcome = Outcome::Failed {
                kind: err.kind(),
                message: inner_message(&err),
            };
            record(report, backend, step, outcome);
            Err(err)
        }
    }
}

fn connection_failed(backend: Backend, err: ProvisionError) -> ProvisionReport {
    err.log_and_record(Step::Connect.as_str());
    let mut report = ProvisionReport::default();
    record(
        &mut report,
        backend,
        Step::Connect,
        Outcome::Failed {
            kind: FailureKind::Fatal,
            message: inner_message(&err),
        },
    );
    report.mark_halted();
    record(&mut report, backend, Step::Close, Outcome::Done);
    report
}

// The status line supplies its own "Database error:" prefix.
fn inner_message(err: &ProvisionError) -> String {
    match err {
        ProvisionError::Database(db) => db.to_string(),
        other => other.to_string(),
    }
}

fn record(report: &mut ProvisionReport, backend: Backend, step: Step, outcome: Outcome) {
    let entry = StepReport {
        backend,
        step,
        outcome,
    };
    println!("{}", entry);

    let table = match &entry.step {
        Step::CreateTable(name) => name.as_str(),
        _ => "",
    };
    if entry.is_failure() {
        warn!(step = entry.step.as_str(), table, status = %entry, "Provisioning step failed");
    } else {
        info!(step = entry.step.as_str(), table, status = %entry, "Provisioning step finished");
    }

    report.push(entry);
}
