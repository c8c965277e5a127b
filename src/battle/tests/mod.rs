pub mod common;




#[cfg(test)]
mod test_auto_battle;
