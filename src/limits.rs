/*!
 * Access-Layer Limits
 *
 * Centralized limits for path handling. Values carry rationale comments
 * explaining why they exist.
 */

/// Longest translated path accepted by recursive directory creation, in
/// bytes. Matches the platform `PATH_MAX` so an oversized path fails with
/// a name-too-long condition before any directory is created, instead of
/// part-way through the walk.
/// [LINUX-COMPAT] 4096 on Linux, 1024 on macOS.
pub const MAX_PATH_BYTES: usize = nix::libc::PATH_MAX as usize;
