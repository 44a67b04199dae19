//! Scroll mode for a collaborative whiteboard.
//!
//! Turns an unbounded shared canvas into a fixed-width, vertically scrolling
//! document. All participants share one `scrollTop`; each derives its own
//! camera, scale and page from its local viewport. The crate compiles to
//! WebAssembly for the browser; the host supplies the rendering engine, the
//! replicated store and the page-event channel through the traits in
//! [`host`] and [`store`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`mode`] | [`mode::ScrollMode`]: lifecycle, wiring and dispatch |
//! | [`engine`] | Host-free projection core [`engine::ScrollCore`] |
//! | [`graph`] | Dependency graph that orders recomputation |
//! | [`viewport`] | Viewport observer and width-derived scale |
//! | [`space`] | Logical document dimensions and scroll clamping |
//! | [`camera`] | Camera directives derived from scroll and scale |
//! | [`page`] | Fractional page index |
//! | [`input`] | Wheel handling |
//! | [`store`] | Shared scroll record and an in-memory store |
//! | [`lifecycle`] | Disposers and the side-effect bag |
//! | [`host`] | Capabilities consumed from the environment |
//! | [`dom`] | `web-sys` wheel binding |
//! | [`config`] | Runtime configuration |
//! | [`consts`] | Default dimensions and keys |

pub mod camera;
pub mod config;
pub mod consts;
pub mod dom;
pub mod engine;
pub mod graph;
pub mod host;
pub mod input;
pub mod lifecycle;
pub mod mode;
pub mod page;
pub mod space;
pub mod store;
pub mod viewport;
