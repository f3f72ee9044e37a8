//! CPU kernel implementations
//!
//! Low-level compute kernels, monomorphized over index type, value type,
//! binary functor and reducer. Validation happens in the callers; kernels
//! assume consistent shapes.

pub mod spmm;

pub use spmm::{spmm_cmp_csr_kernel, spmm_sum_csr_kernel};
