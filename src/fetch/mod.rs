// src/fetch/mod.rs

//! Getting the raw dataset onto disk: download the monthly archive, unpack
//! it, and locate the CSV inside.

pub mod extract;
pub mod zips;

pub use extract::{extract_zip, find_data_file};
pub use zips::{build_client, download_zip};
