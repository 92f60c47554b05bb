mod test_room_capacity;
