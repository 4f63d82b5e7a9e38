//! Result certification.
//!
//! - [`score`]: `adjusted_support`, `SupportScore`
//! - [`certificator`]: `ResultCertificator`, `CollusionAwareCertificator`,
//!   `Certification`, `AgreementClass`

pub mod certificator;
pub mod score;

pub use certificator::{
    AgreementClass, Certification, CollusionAwareCertificator, ResultCertificator,
    MIN_SUBMISSIONS,
};
pub use score::{adjusted_support, SupportScore, DEFAULT_LIKELIHOOD_FLOOR};
