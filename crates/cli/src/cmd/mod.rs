mod license;
mod purchase;
mod review;

pub use license::cmd_license;
pub use purchase::cmd_purchase;
pub use review::cmd_review;
