//! Edge case tests for kudl-par
