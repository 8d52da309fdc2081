/*!
Core of the poll administration console.

Two independent pieces make up this crate:

- [`rut`] checks and formats Chilean national identifiers (RUT) with their
  modulus-11 check character.
- [`csv_codec`] turns records into CSV text and back.

Around them, [`poll`], [`tally`] and [`builder`] hold a single-question
poll, its votes and the rows that the console exports. All the functions
are pure: they take plain data and return plain data, and keep no state
between calls.

See the [manual] for the formats of the exported files.
*/

mod config;

pub mod builder;
pub mod csv_codec;
pub mod manual;
pub mod poll;
pub mod rut;
pub mod tally;

pub use crate::config::*;
pub use crate::poll::Poll;
