//! Unit tests of the deployment console

mod test_console;
mod test_fsm;
mod test_grid;
