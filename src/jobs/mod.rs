//! Background jobs processed by the apalis worker (`jobs work`).

mod email_job;
mod queue;

pub use email_job::{email_job_handler, EmailJob, PasswordResetEmail};
pub use queue::{EmailQueue, PostgresEmailQueue};

#[cfg(any(test, feature = "test-utils"))]
pub use queue::MockEmailQueue;
