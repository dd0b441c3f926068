//! Some utility functions

use crate::board::{Board, Column};
use crate::task::{Priority, Task};

/// A debug utility that pretty-prints a board, column by column
pub fn print_board(board: &Board) {
    for column in Column::ALL {
        let tasks = board.column(column);
        println!("{} ({})", column, tasks.len());
        for task in &tasks {
            print_task(task);
        }
    }
}

pub fn print_task(task: &Task) {
    let priority = match task.priority() {
        Priority::Low => " ",
        Priority::Medium => "*",
        Priority::High => "!",
    };
    println!("    {} {}\t(due {})\t{}", priority, task.title(), task.deadline().format("%Y-%m-%d"), task.id());
}
