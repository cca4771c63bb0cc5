//! Bundled programs.

/// Prints `Hello World!\n`.
pub const HELLO_WORLD: &[u8] = b"++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]\
>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

/// Prints `Hello World!` and then echoes its input until it runs out.
pub const ECHO_DEMO: &[u8] = b"++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]\
>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.\
,[.,]";

/// Input for [`ECHO_DEMO`].
pub const ECHO_INPUT: &[u8] = b" (said the BF program)";
