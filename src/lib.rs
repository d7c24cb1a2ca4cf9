//! Finite-field arithmetic over GF(2^8) and systematic Reed-Solomon coding
//!
//! ```
//! use ffrs::ReedSolomon;
//!
//! let rs = ReedSolomon::with_ecc_len(10)?;
//! let mut codeword = rs.encode(b"Hello World")?;
//! codeword[0] ^= 0xFF;
//! codeword[7] ^= 0xFF;
//!
//! assert_eq!(rs.decode(&codeword, &[])?, b"Hello World");
//! # Ok::<(), ffrs::RsError>(())
//! ```

pub mod config;
pub mod error;
pub mod galois;
pub mod poly;
pub mod reed_solomon;

pub use config::{BlockConfig, CodecConfig, FieldConfig};
pub use error::{Result, RsError};
pub use galois::{gf256, GaloisField};
pub use reed_solomon::{BlockCodec, ReedSolomon};
