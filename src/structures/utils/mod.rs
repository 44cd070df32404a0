pub mod atomic_markable;
