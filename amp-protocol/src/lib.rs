//! # AMP Protocol
//!
//! AMQP 1.0 transport and messaging composite constructors.
//!
//! Everything in this crate is generated at build time from
//! `schema/transport.xml` and `schema/messaging.xml`:
//! - [`field`]: positional slot of each field within its composite
//! - [`keyword`]: field keyword codes shared by every constructor, and the
//!   `KW_END` terminator
//! - [`frame`]: descriptor symbol, code and index of each frame type
//! - [`descriptor`]: descriptor symbol and code of each described composite
//! - one builder (`OpenBuilder`, ...) and one keyword/value constructor
//!   (`proto_open`, `proto_open_kw`, ...) per composite
//!
//! ```
//! use amp_protocol::{keyword, proto_open};
//! use amp_protocol::amp_types::Arg;
//!
//! let open = proto_open([
//!     (keyword::CONTAINER_ID, Arg::from("client-1")),
//!     (keyword::CHANNEL_MAX, Arg::from(1023u16)),
//! ]);
//! assert_eq!(open.as_described().and_then(|d| d.symbol()), Some("amqp:open:list"));
//! ```

pub use amp_types;

include!(concat!(env!("OUT_DIR"), "/protocol_decls.rs"));
include!(concat!(env!("OUT_DIR"), "/protocol_impl.rs"));
