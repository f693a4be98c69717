pub mod executor;

pub use executor::ProductCreateExecutor;
