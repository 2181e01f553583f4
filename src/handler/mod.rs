mod callback;
mod command;
mod message;
mod reply;

use callback::{get_callback_handler, handle_callback_unknown};
use command::get_command_handler;
use message::{get_message_handler, handle_message_unknown};
use teloxide::{
    dispatching::{UpdateFilterExt, UpdateHandler},
    dptree,
    types::Update,
};

/// One handler tree for both update sources. Needs `Bot`, `Me` and
/// `Arc<Catalog>` in the dependency map. Messages and callbacks that match
/// no trigger end in a silent endpoint; other update kinds reach the
/// dispatcher's default handler.
pub fn get_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(get_command_handler())
        .branch(get_message_handler())
        .branch(get_callback_handler())
        .branch(Update::filter_message().endpoint(handle_message_unknown))
        .branch(Update::filter_callback_query().endpoint(handle_callback_unknown))
}
