//! Edge case tests for kudl-lex
