mod bdd_steps;
mod scenarios;
