mod common;
mod emissions;
mod routing;
