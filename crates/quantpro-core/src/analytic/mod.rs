pub mod black_scholes;
