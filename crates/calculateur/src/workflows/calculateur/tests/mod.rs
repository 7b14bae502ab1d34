mod common;
mod litigation;
