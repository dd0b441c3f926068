use kando_client::utils::print_board;
use kando_client::{Column, Session, TaskId};

#[tokio::main]
async fn main() {
    env_logger::init();

    // A guest session never touches the network
    let session = Session::guest();
    let board = session.board();
    board.refresh(None, None).await.unwrap();

    println!("--- Fresh guest board ---");
    print_board(&board);

    let id = TaskId::from("mock-1");
    board.move_task(&id, Column::Done).await.unwrap();

    println!("\n--- After moving {} to done ---", id);
    print_board(&board);

    session.logout();
}
