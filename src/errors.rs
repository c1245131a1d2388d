//! Error types for the library, generated by `error_chain!`.
//!
//! Other modules `use crate::errors::*;` to get `Error`, `ErrorKind`, `Result` and the
//! `ResultExt` trait that adds `chain_err`.

error_chain! {

    foreign_links {
        // A mask or maze image could not be decoded.
        Decode(::image::ImageError);
        Io(::std::io::Error);
    }

    errors {
        // Nothing to choose from, e.g. a random cell of a grid without any cells.
        InvalidState(reason: String) {
            description("invalid state")
            display("invalid state: {}", reason)
        }

        // A contract violation by the caller, e.g. linking two cells that are not adjacent.
        InvalidOperation(reason: String) {
            description("invalid operation")
            display("invalid operation: {}", reason)
        }

        UnknownAlgorithm(name: String) {
            description("unknown maze generation algorithm")
            display("unknown maze generation algorithm '{}'", name)
        }
    }
}
