pub mod eval;
pub mod lex;
pub mod numeral;
pub mod session;

pub use eval::Evaluator;
pub use lex::Lexer;
pub use numeral::Numeral;
pub use session::{Reply, Session};
