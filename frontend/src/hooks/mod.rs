pub mod use_repetitions;
