mod inline;
mod inline_mut;
mod inline_ref;
