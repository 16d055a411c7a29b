//! Audio capture, chunk assembly, and PCM encoding

pub mod capture;
pub mod chunk;
pub mod encode;
pub mod wav;

pub use capture::{list_input_devices, AudioFrame, FrameRead, FrameSource};
pub use chunk::{normalize, AudioChunk, ChunkAssembler, SilenceGate};
pub use encode::{decode_chunk, encode_chunk, EncodedChunk};
pub use wav::WavFileSource;
