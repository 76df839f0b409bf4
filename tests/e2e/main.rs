//! End-to-end scenarios driving attn_core against real trees on disk.

mod harness;
