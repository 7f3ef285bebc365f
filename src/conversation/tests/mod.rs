//! Unit tests for the conversation context.
