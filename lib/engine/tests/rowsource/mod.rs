mod empty;
mod extend;
mod having;
mod minus;
mod pipeline;
mod scope;
mod test_utils;
mod values;
