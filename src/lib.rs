//! # Polytable
//!
//! String-keyed hash tables built on a polynomial string hash.
//!
//! This crate provides two table implementations behind one contract, [`StringTable`]:
//!
//! - `ChainingTable`: every bucket owns a chain of the entries that hash to it
//! - `OpenAddressingTable`: one entry per slot, collisions resolved by double hashing
//!
//! Both start with 19 buckets and grow by 75% once half of the buckets are in use, rehashing
//! every entry into the larger array.
//!
//! ## Basic Usage
//!
//! ```rust
//! use polytable::ChainingTable;
//!
//! // Create a new table
//! let mut table = ChainingTable::new();
//!
//! // Insert values
//! table.add("apple".to_string(), 1);
//! table.add("banana".to_string(), 2);
//!
//! // Retrieve values
//! assert_eq!(table.find("apple"), Some(&1));
//!
//! // Update values
//! table.add("apple".to_string(), 10);
//! assert_eq!(table.find("apple"), Some(&10));
//!
//! // Remove values
//! assert_eq!(table.delete("apple"), Some(10));
//! assert_eq!(table.find("apple"), None);
//! ```
//!
//! ## Open Addressing
//!
//! ```rust
//! use polytable::{OpenAddressingTable, StringTable};
//!
//! let mut table = OpenAddressingTable::new();
//! for i in 0..10 {
//!     table.add(format!("key-{i}"), i);
//! }
//!
//! // 10 entries reached half of the 19 initial slots
//! assert_eq!(table.capacity(), 33);
//! assert!(table.load_factor() < 0.5);
//!
//! // Deleted slots become tombstones until the next resize
//! table.delete("key-3");
//! assert_eq!(table.tombstones(), 1);
//! assert_eq!(table.find("key-4"), Some(&4));
//! ```

/// Module implementing the separate chaining table
mod chaining_table;
/// Module parsing and running `add` / `find` / `del` command lines
pub mod command;
/// Module holding the sizing parameters of a table
pub mod config;
/// Module implementing the double hashing open-addressing table
mod open_addressing_table;
/// Module implementing the polynomial string hash
pub mod polynomial_hash;
/// Module defining the contract shared by both tables
mod table;
/// Utility functions and traits for the tables
mod utils;

pub use chaining_table::ChainingTable;
pub use command::{Command, CommandError, Reply};
pub use config::TableConfig;
pub use open_addressing_table::{Iter, OpenAddressingTable};
pub use polynomial_hash::PolynomialHash;
pub use table::StringTable;
pub use utils::{TableExtensions, from_pairs};
