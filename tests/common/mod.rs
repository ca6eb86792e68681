#![allow(dead_code)]

mod fixture;
pub use fixture::{test_data, Fixture};

mod ld_prune_runner;
pub use ld_prune_runner::LdPruneRunner;

#[macro_export]
macro_rules! validate_file {
    ($ref_file:expr, $obtained_file:expr) => {
        let want = include_str!($ref_file);
        let got  = std::fs::read_to_string($obtained_file)
            .unwrap_or_else(|_| panic!("Failed to open {:?}", $obtained_file));
        assert_eq!(want, got)
    };
}
