//! File system layer: content discovery, reading, and generated-file output

pub mod reader;
pub mod resolver;
pub mod writer;

pub use reader::{ContentFile, ContentReader, ReaderConfig};
pub use resolver::{ContentResolver, ResolverConfig};
pub use writer::{read_artifact, ArtifactWriter, WriteResult, WriterConfig};
