use std::io;

use pokechess::*;


fn main() -> io::Result<()> {
    env_logger::init();

    let mut game = match GameEngine::new(Rules::classic()) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("Cannot start the game: {err}");
            return Ok(());
        }
    };
    let shape = game.rules().board_shape;
    println!("{}\n", render_as_ascii(game.state(), shape));
    loop {
        let mut buffer = String::new();
        if io::stdin().read_line(&mut buffer)? == 0 {
            return Ok(());
        }
        let player = game.active_player();
        match parse_action(&buffer, player, game.state()) {
            Err(err) => println!("Bad input: {err}"),
            Ok(action) => match game.apply_action(action) {
                Err(err) => println!("Impossible action: {err}"),
                Ok(state) => println!("{}\n", render_as_ascii(state, shape)),
            },
        }
        if game.status() != GameStatus::Ongoing {
            println!("\n{:?}", game.status());
            return Ok(());
        }
    }
}
