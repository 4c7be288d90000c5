//! UI utilities for the client.

use std::io::Write;

/// Print output from the network side and redisplay the prompt
pub fn print_and_redisplay(output: &str, user: &str) {
    print!("{}", output);
    redisplay_prompt(user);
}

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt(user: &str) {
    print!("{}> ", user);
    std::io::stdout().flush().ok();
}
