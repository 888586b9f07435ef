mod scoping;
mod worked_example;
