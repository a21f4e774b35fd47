mod csv_round_trip;
mod store_backends;
