pub mod control; // Control-context event handling and the cross-thread protocol
pub mod dsp;
pub mod params; // Lock-free parameter store shared between contexts
pub mod pipeline; // Per-block processing order
pub mod presets;

/// Upper bound for per-block scratch buffers. Pipelines clamp requested
/// block lengths to this so no allocation happens after construction.
pub const MAX_BLOCK_SIZE: usize = 2048;
