pub type CmdResult<T> = tfbench::Result<T>;

pub mod run;
