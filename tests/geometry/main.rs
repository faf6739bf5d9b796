mod conversions;
mod invariants;
mod octrees;
mod scenarios;
