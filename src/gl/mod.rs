// gl/ - WebGL2 backend

mod compositor;
mod program;
mod target;
mod texture;

pub use compositor::GlCompositor;
