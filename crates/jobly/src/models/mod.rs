//! Entity models.
//!
//! Each submodule owns its SQL. Operations take `&impl GenericClient`, so
//! they run unchanged on a connection, a pooled client or a transaction.

pub mod company;
pub mod job;
pub mod user;

pub use company::{Company, CompanyDetail, CompanyFilter, CompanyPatch, NewCompany};
pub use job::{CompanySummary, Job, JobDetail, JobFilter, JobListing, JobPatch, JobSummary, NewJob};
pub use user::{NewUser, User, UserDetail, UserPatch};
